//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{
    ProcessCheck, collect_input_files, output_dir_for, output_path_for, should_process,
};
pub use processor::{ProcessResult, classify_image, process_file};
