// Declare the cli module, which defines the command-line interface
pub mod cli;

// Declare the collector module, which expands files and folders into an ordered file list
pub mod collector;

// Declare the commands module, which runs each subcommand
pub mod commands;

// Declare the config module, which handles configuration management
pub mod config;

// Declare the diagnostics module, which reports how each file would be decoded
pub mod diagnostics;

// Declare the display module, which handles displaying information to the user
pub mod display;

// Declare the encoding module, which handles encoding resolution and conversion
pub mod encoding;

// Declare the errors module, which contains custom error types
pub mod errors;

// Declare the logging module, which handles logging of messages and errors
pub mod logging;

// Declare the merge module, which concatenates decoded files into one output
pub mod merge;

// Declare the progress module, which shows a spinner while a merge runs
pub mod progress;
