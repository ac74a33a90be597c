//! Output formatting module.

mod formatter;
mod human;
mod json;

pub use formatter::ArchiveListing;
pub use formatter::DistributionFile;
pub use formatter::FileReport;
pub use formatter::OutputFormatter;
pub use json::JsonFormatter;

use human::HumanFormatter;

/// Creates an output formatter based on CLI flags
pub fn create_formatter(json: bool, verbose: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter::new(verbose, quiet))
    }
}
