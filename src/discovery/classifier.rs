use log::debug;

use super::catalog::DomainProfile;

/// Decides which domain an observation belongs to. Returns an index into
/// `domains`, which is never empty.
pub trait DomainClassifier {
	fn classify(&mut self, observation: &str, domains: &[DomainProfile]) -> usize;
}

/// Deterministic pseudo-random pick, one draw per call.
#[derive(Clone, Debug, Default)]
pub struct SeededClassifier {
	draws: usize,
}

impl SeededClassifier {
	pub fn new(seed: usize) -> Self {
		Self { draws: seed }
	}
}

const LCG_MODULUS: u64 = 233_280;

/// Linear congruential step in [0, 1). The seed is reduced modulo the
/// period first, so the arithmetic fits in `u64` for any `usize`.
fn rand_simple(seed: usize) -> f64 {
	let seed = seed as u64 % LCG_MODULUS;
	let x = ((seed + 1) * 9301 + 49297) % LCG_MODULUS;
	(x as f64) / LCG_MODULUS as f64
}

impl DomainClassifier for SeededClassifier {
	fn classify(&mut self, _observation: &str, domains: &[DomainProfile]) -> usize {
		let pick = (rand_simple(self.draws) * domains.len() as f64) as usize;
		self.draws = self.draws.wrapping_add(1);
		pick.min(domains.len().saturating_sub(1))
	}
}

/// Picks the domain whose keywords occur most often in the observation.
/// Ties go to the earlier domain; no match defers to `fallback`.
#[derive(Clone, Debug, Default)]
pub struct KeywordClassifier<F> {
	fallback: F,
}

impl<F: DomainClassifier> KeywordClassifier<F> {
	pub fn new(fallback: F) -> Self {
		Self { fallback }
	}
}

impl<F: DomainClassifier> DomainClassifier for KeywordClassifier<F> {
	fn classify(&mut self, observation: &str, domains: &[DomainProfile]) -> usize {
		let text = observation.to_lowercase();
		let best = domains
			.iter()
			.enumerate()
			.map(|(idx, d)| (idx, d.keywords.iter().filter(|k| text.contains(*k)).count()))
			.filter(|&(_, hits)| hits > 0)
			.fold(None, |best: Option<(usize, usize)>, (idx, hits)| match best {
				Some((_, top)) if top >= hits => best,
				_ => Some((idx, hits)),
			});

		match best {
			Some((idx, hits)) => {
				debug!("Observation matched {} on {hits} keywords", domains[idx].name);
				idx
			}
			None => self.fallback.classify(observation, domains),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::discovery::catalog::DOMAINS;

	/// Always answers the same index.
	struct Fixed(usize);

	impl DomainClassifier for Fixed {
		fn classify(&mut self, _: &str, _: &[DomainProfile]) -> usize {
			self.0
		}
	}

	#[test]
	fn seeded_picks_stay_in_range_and_repeat_per_seed() {
		let mut a = SeededClassifier::new(7);
		let mut b = SeededClassifier::new(7);
		for _ in 0..200 {
			let pick = a.classify("", DOMAINS);
			assert!(pick < DOMAINS.len());
			assert_eq!(pick, b.classify("", DOMAINS));
		}
	}

	#[test]
	fn huge_seeds_stay_in_range() {
		for seed in [usize::MAX, usize::MAX - 1, u32::MAX as usize, 1_700_000_000_000u64 as usize] {
			let mut c = SeededClassifier::new(seed);
			for _ in 0..3 {
				assert!(c.classify("nothing recognisable", DOMAINS) < DOMAINS.len());
			}
			assert!((0.0..1.0).contains(&rand_simple(seed)));
		}
	}

	#[test]
	fn keyword_miss_with_clock_seed_falls_back_safely() {
		let mut c = KeywordClassifier::new(SeededClassifier::new(usize::MAX));
		assert!(c.classify("nothing recognisable", DOMAINS) < DOMAINS.len());
	}

	#[test]
	fn seeded_picks_vary_between_draws() {
		let mut c = SeededClassifier::default();
		let picks: Vec<_> = (0..20).map(|_| c.classify("", DOMAINS)).collect();
		assert!(picks.windows(2).any(|w| w[0] != w[1]));
	}

	#[test]
	fn keywords_beat_the_fallback() {
		let mut c = KeywordClassifier::new(Fixed(0));
		let idx = c.classify("The photon wavelength shifted across the spectrum", DOMAINS);
		assert_eq!(DOMAINS[idx].name, "Quantum Mechanics");

		let idx = c.classify("Gas PRESSURE rose with temperature", DOMAINS);
		assert_eq!(DOMAINS[idx].name, "Thermodynamics");
	}

	#[test]
	fn no_keyword_defers_to_fallback() {
		let mut c = KeywordClassifier::new(Fixed(5));
		assert_eq!(c.classify("nothing recognisable here", DOMAINS), 5);
	}
}
