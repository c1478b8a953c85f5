pub mod formatter;

pub use formatter::{print_classification, print_layout, print_plan, print_spec, step_title};
