//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::Config;

/// Print help message based on configuration state.
pub fn print_smart_help(config: &Config) {
    if config.detector.model.is_none() {
        print_first_time_help();
    } else {
        print_configured_help();
    }
}

/// Print detailed setup guide for first-time users.
pub fn print_first_time_help() {
    println!("No detector configured. Get started with binwise:");
    println!();
    println!("1. Initialize configuration:");
    println!("   binwise config init");
    println!();
    println!("2. Point the [detector] section at a YOLO model exported to ONNX");
    println!("   and a labels file (one class per line, in model order):");
    println!();
    println!("   [detector]");
    println!("   model = \"/path/to/waste.onnx\"");
    println!("   labels = \"/path/to/labels.txt\"");
    println!();
    println!("3. Classify a photo:");
    println!("   binwise photo.jpg --city oakland");
    println!();
    println!("Rule lookups work without a model:");
    println!("   binwise rules list");
    println!("   binwise resolve --city livermore --class plastic --subtype plastic_bag");
    println!();
    println!("Run 'binwise -h' for all options.");
}

/// Print brief usage reminder for configured users.
pub fn print_configured_help() {
    println!("Usage: binwise [IMAGES]... [OPTIONS]");
    println!();
    println!("Example: binwise photo.jpg --city oakland -f json,csv");
    println!();
    println!("Run 'binwise -h' for all options or 'binwise serve' to start the HTTP service.");
}
