pub mod calendar;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod interest;
pub mod rates;
pub mod results;
pub mod state;
pub mod timeline;
pub mod types;

// re-export key types
pub use config::{CalculationInput, CalculationInputBuilder, TaxPolicy, TimelineEvent, WithholdingTaxConfig};
pub use decimal::{Money, Rate};
pub use engine::{compute_savings, SavingsCalculator};
pub use errors::{Result, SavingsError};
pub use interest::{AccrualEngine, AccrualWindow, PayoutAssessment, WithholdingRules};
pub use rates::{latest_rate_table, BankRateRecord, RateRange, RateSource, RateTable};
pub use results::{CalculationResult, Payout, Step, YearSummary};
pub use state::{Holdings, YearContext};
pub use timeline::{EventTimeline, ScheduledEvent};
pub use types::{EventKind, InterestMethod, TaxStatus, Timezone, YearMode};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
