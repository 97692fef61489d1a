//! Step sequencing for the hypothesis → equation → experiments workflow.
//!
//! Every call gets a [`Ticket`]. Re-submitting a step hands out a new one
//! and voids the tickets of that step and everything downstream, so a slow
//! response can never overwrite results that belong to a newer hypothesis.

use log::{debug, info};
use thiserror::Error;

use crate::error::FlowError;
use crate::flows::{EquationOutput, ExperimentsOutput, HypothesisOutput};

/// The three model-backed steps, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
	/// Domain context to hypothesis.
	Hypothesis,
	/// Hypothesis and data to equation.
	Equation,
	/// Hypothesis and equation to validation experiments.
	Experiments,
}

impl Step {
	/// Every step, upstream first.
	pub const ALL: [Step; 3] = [Step::Hypothesis, Step::Equation, Step::Experiments];

	fn index(self) -> usize {
		match self {
			Step::Hypothesis => 0,
			Step::Equation => 1,
			Step::Experiments => 2,
		}
	}

	/// The step whose result this one consumes.
	pub fn prerequisite(self) -> Option<Step> {
		match self {
			Step::Hypothesis => None,
			Step::Equation => Some(Step::Hypothesis),
			Step::Experiments => Some(Step::Equation),
		}
	}

	/// This step and every step after it.
	fn and_downstream(self) -> impl Iterator<Item = Step> {
		Self::ALL.into_iter().skip(self.index())
	}
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowError {
	#[error("{0:?} needs the previous step to finish first")]
	Locked(Step),

	#[error("{0:?} is already running")]
	Busy(Step),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
	step: Step,
	serial: u64,
}

/// What happened to a finished call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
	/// The result or error was recorded.
	Applied,
	/// The ticket was voided by a newer call and the outcome dropped.
	Stale,
}

/// Tone of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
	/// A step finished.
	Success,
	/// A step failed and can be retried.
	Error,
}

/// The last thing worth telling the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
	pub kind: NoticeKind,
	pub title: String,
	pub message: String,
}

/// Results, in-flight calls and the latest notice of the workflow page.
#[derive(Clone, Debug, Default)]
pub struct Workflow {
	hypothesis: Option<HypothesisOutput>,
	equation: Option<EquationOutput>,
	experiments: Option<ExperimentsOutput>,
	in_flight: [Option<u64>; 3],
	serial: u64,
	notice: Option<Notice>,
}

impl Workflow {
	/// Nothing run yet.
	pub fn new() -> Self {
		Self::default()
	}

	/// Latest applied hypothesis.
	pub fn hypothesis(&self) -> Option<&HypothesisOutput> {
		self.hypothesis.as_ref()
	}

	/// Latest applied equation, cleared when the hypothesis is re-run.
	pub fn equation(&self) -> Option<&EquationOutput> {
		self.equation.as_ref()
	}

	/// Latest applied experiments.
	pub fn experiments(&self) -> Option<&ExperimentsOutput> {
		self.experiments.as_ref()
	}

	/// Message to show until dismissed or replaced.
	pub fn notice(&self) -> Option<&Notice> {
		self.notice.as_ref()
	}

	/// Hides the current notice.
	pub fn dismiss_notice(&mut self) {
		self.notice = None;
	}

	/// A call for `step` is in flight.
	pub fn is_busy(&self, step: Step) -> bool {
		self.in_flight[step.index()].is_some()
	}

	/// `step` has an applied result.
	pub fn has_result(&self, step: Step) -> bool {
		match step {
			Step::Hypothesis => self.hypothesis.is_some(),
			Step::Equation => self.equation.is_some(),
			Step::Experiments => self.experiments.is_some(),
		}
	}

	/// [`Workflow::begin`] would succeed.
	pub fn can_begin(&self, step: Step) -> bool {
		!self.is_busy(step) && step.prerequisite().is_none_or(|p| self.has_result(p))
	}

	/// Starts a call for `step`, clearing its result and everything
	/// downstream of it.
	pub fn begin(&mut self, step: Step) -> Result<Ticket, WorkflowError> {
		if self.is_busy(step) {
			return Err(WorkflowError::Busy(step));
		}
		if let Some(prev) = step.prerequisite() {
			if !self.has_result(prev) {
				return Err(WorkflowError::Locked(step));
			}
		}

		for s in step.and_downstream() {
			self.clear(s);
			self.in_flight[s.index()] = None;
		}
		self.serial += 1;
		self.in_flight[step.index()] = Some(self.serial);
		debug!("Began {step:?} with ticket {}", self.serial);

		Ok(Ticket {
			step,
			serial: self.serial,
		})
	}

	/// Records the hypothesis call behind `ticket`.
	pub fn complete_hypothesis(
		&mut self,
		ticket: Ticket,
		outcome: Result<HypothesisOutput, FlowError>,
	) -> Completion {
		self.complete(ticket, outcome, "Error", "A new hypothesis has been generated.", |w, out| {
			w.hypothesis = Some(out)
		})
	}

	/// Records the equation call behind `ticket`.
	pub fn complete_equation(
		&mut self,
		ticket: Ticket,
		outcome: Result<EquationOutput, FlowError>,
	) -> Completion {
		self.complete(
			ticket,
			outcome,
			"Error",
			"An equation has been successfully derived.",
			|w, out| w.equation = Some(out),
		)
	}

	/// Records the experiments call behind `ticket`.
	pub fn complete_experiments(
		&mut self,
		ticket: Ticket,
		outcome: Result<ExperimentsOutput, FlowError>,
	) -> Completion {
		self.complete(
			ticket,
			outcome,
			"Error suggesting experiments",
			"Suggested experiments are ready.",
			|w, out| w.experiments = Some(out),
		)
	}

	fn complete<T>(
		&mut self,
		ticket: Ticket,
		outcome: Result<T, FlowError>,
		error_title: &str,
		success_message: &str,
		store: impl FnOnce(&mut Self, T),
	) -> Completion {
		let slot = &mut self.in_flight[ticket.step.index()];
		if *slot != Some(ticket.serial) {
			debug!("Dropping stale {:?} response {}", ticket.step, ticket.serial);
			return Completion::Stale;
		}
		*slot = None;

		self.notice = Some(match outcome {
			Ok(out) => {
				store(self, out);
				info!("{:?} completed", ticket.step);
				Notice {
					kind: NoticeKind::Success,
					title: "Success!".into(),
					message: success_message.into(),
				}
			}
			Err(e) => Notice {
				kind: NoticeKind::Error,
				title: error_title.into(),
				message: e.to_string(),
			},
		});
		Completion::Applied
	}

	fn clear(&mut self, step: Step) {
		match step {
			Step::Hypothesis => self.hypothesis = None,
			Step::Equation => self.equation = None,
			Step::Experiments => self.experiments = None,
		}
	}
}
