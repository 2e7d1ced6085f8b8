pub mod alert;
pub mod app;
pub mod cli;
pub mod duration;
pub mod logging;
pub mod promsaint;

pub use alert::{AlertKind, AlertRecord};
pub use app::run;
pub use cli::{AlertArgs, ValidationError};
pub use duration::FirePeriod;
pub use promsaint::{Delivery, PromsaintClient, PromsaintConfig};
