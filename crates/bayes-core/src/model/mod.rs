//! Network data model.
//!
//! - `variable`: the domain registry (ordered state labels per variable).
//! - `table`: conditional tables and the per-network table store.
//! - `joint`: evaluation of the factored joint distribution.
//! - `builder` / `validate`: explicit construction and model checking.

mod assignment;
mod builder;
mod evidence;
mod joint;
mod network;
mod table;
pub mod validate;
mod variable;

pub use assignment::Assignment;
pub use builder::{NetworkBuilder, TabularCpd};
pub use evidence::Evidence;
pub use joint::JointFactorizer;
pub use network::BayesNetwork;
pub use table::{ConditionalTable, Distribution, TableStore};
pub use variable::{DomainRegistry, Variable, VariableId};
