use leptos::prelude::*;

use crate::flows::EquationOutput;

#[component]
pub fn ResultsDisplay(output: EquationOutput) -> impl IntoView {
	let accuracy = output.accuracy_percent();
	let rows = output.metric_rows();

	view! {
		<div class="results">
			<section class="card accent">
				<h3>"Candidate Equation"</h3>
				<p class="equation">{output.equation}</p>
			</section>
			<div class="grid two">
				<section class="card">
					<h4>"Accuracy"</h4>
					<div class="metric">{accuracy}</div>
					<p class="muted">"Fit against experimental data"</p>
				</section>
				<section class="card">
					<h4>"Additional Metrics"</h4>
					<dl class="metrics">
						{rows
							.into_iter()
							.map(|(key, value)| {
								view! {
									<div class="metric-row">
										<dt>{key}":"</dt>
										<dd>{value}</dd>
									</div>
								}
							})
							.collect_view()}
					</dl>
				</section>
			</div>
		</div>
	}
}
