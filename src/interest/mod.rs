pub mod accrual;
pub mod withholding;

pub use accrual::{AccrualEngine, AccrualWindow};
pub use withholding::{PayoutAssessment, WithholdingRules};
