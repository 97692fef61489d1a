use crate::components::knowledge_graph::{GraphStore, Point};
use crate::error::GraphError;

pub const ROOT: &str = "Physics";

pub const ROOT_GROUP: u32 = 1;
pub const CLASSICAL_GROUP: u32 = 2;
pub const MODERN_GROUP: u32 = 3;
/// Laws integrated by a finished discovery run.
pub const LAW_GROUP: u32 = 4;

pub const ROOT_SIZE: f64 = 20.0;
pub const DOMAIN_SIZE: f64 = 14.0;
pub const LAW_SIZE: f64 = 12.0;

/// Everything the scripted run says about one domain.
#[derive(Debug)]
pub struct DomainProfile {
	pub name: &'static str,
	pub group: u32,
	pub keywords: &'static [&'static str],
	pub hypothesis: &'static str,
	pub rationale: &'static str,
	pub equation: &'static str,
	pub accuracy: f64,
	pub law: &'static str,
	pub experiments: &'static [(&'static str, &'static str)],
}

pub static DOMAINS: &[DomainProfile] = &[
	DomainProfile {
		name: "Classical Mechanics",
		group: CLASSICAL_GROUP,
		keywords: &["force", "mass", "acceleration", "velocity", "momentum", "pendulum"],
		hypothesis: "The net force on a body is proportional to the rate of change of its momentum.",
		rationale: "Across every trial, acceleration scaled linearly with applied force and inversely with mass.",
		equation: "F = m · a",
		accuracy: 0.991,
		law: "Newton's Second Law",
		experiments: &[
			("Air-track carts", "Vary the mass of a cart on a frictionless track under a constant pull and record acceleration."),
			("Inclined plane", "Roll loaded carts down planes of varying angle and compare the measured acceleration with g·sin θ."),
		],
	},
	DomainProfile {
		name: "Thermodynamics",
		group: CLASSICAL_GROUP,
		keywords: &["heat", "temperature", "pressure", "entropy", "gas", "volume"],
		hypothesis: "At fixed temperature, the pressure of a dilute gas is inversely proportional to its volume.",
		rationale: "Pressure-volume products stayed constant to within noise at every isotherm measured.",
		equation: "P · V = n · R · T",
		accuracy: 0.978,
		law: "Ideal Gas Law",
		experiments: &[
			("Syringe isotherm", "Compress a sealed syringe in a water bath and log pressure against volume."),
			("Heated flask", "Hold volume fixed, heat the flask and check that pressure tracks absolute temperature."),
		],
	},
	DomainProfile {
		name: "Electromagnetism",
		group: CLASSICAL_GROUP,
		keywords: &["charge", "current", "voltage", "magnetic", "field", "resistance"],
		hypothesis: "Current through a conductor is proportional to the voltage across it at constant temperature.",
		rationale: "Current-voltage sweeps on metal wires were linear with a slope fixed by the wire alone.",
		equation: "V = I · R",
		accuracy: 0.985,
		law: "Ohm's Law",
		experiments: &[
			("Wire sweep", "Sweep the supply voltage across wires of different length and gauge and record current."),
			("Temperature drift", "Repeat the sweep with the wire in a cooled bath to bound the constant-temperature assumption."),
		],
	},
	DomainProfile {
		name: "Quantum Mechanics",
		group: MODERN_GROUP,
		keywords: &["photon", "electron", "wavelength", "frequency", "spectrum", "quantum"],
		hypothesis: "Light exchanges energy with matter in discrete packets proportional to its frequency.",
		rationale: "Photoelectron energies rose linearly with light frequency and ignored intensity entirely.",
		equation: "E = h · ν",
		accuracy: 0.973,
		law: "Planck-Einstein Relation",
		experiments: &[
			("Photoelectric threshold", "Illuminate a metal plate with filtered light and measure the stopping voltage per frequency."),
			("Intensity control", "Hold frequency fixed while varying intensity to confirm only electron count changes."),
		],
	},
	DomainProfile {
		name: "Relativity",
		group: MODERN_GROUP,
		keywords: &["light speed", "time dilation", "relativistic", "energy", "rest mass", "muon"],
		hypothesis: "A body's rest mass is equivalent to an energy scaled by the square of the speed of light.",
		rationale: "Mass defects in nuclear reactions matched the released energy divided by c².",
		equation: "E = m · c²",
		accuracy: 0.996,
		law: "Mass-Energy Equivalence",
		experiments: &[
			("Pair annihilation", "Measure gamma energies from electron-positron annihilation against the pair's rest mass."),
			("Nuclear mass defect", "Compare precision mass measurements before and after a fission event with calorimetry."),
		],
	},
	DomainProfile {
		name: "Astrophysics",
		group: MODERN_GROUP,
		keywords: &["galaxy", "redshift", "orbit", "star", "planet", "cosmic"],
		hypothesis: "Distant galaxies recede at speeds proportional to their distance.",
		rationale: "Redshift grew linearly with distance inferred from standard candles across the sample.",
		equation: "v = H₀ · d",
		accuracy: 0.942,
		law: "Hubble-Lemaître Law",
		experiments: &[
			("Cepheid ladder", "Calibrate distances with Cepheid variables and compare against measured redshifts."),
			("Supernova survey", "Extend the fit with type Ia supernovae to test linearity at larger distances."),
		],
	},
];

/// The starting graph: the root and one node per catalog domain, so every
/// law a run can produce has its parent domain in place.
pub fn seed_store(origin: Point) -> Result<GraphStore, GraphError> {
	let mut store = GraphStore::new();
	store.add_node(ROOT, ROOT_GROUP, ROOT_SIZE, origin)?;
	for d in DOMAINS {
		store.add_node(d.name, d.group, DOMAIN_SIZE, origin)?;
		store.add_edge(ROOT, d.name)?;
	}
	Ok(store)
}
