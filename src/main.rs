//! stockmerge CLI
//!
//! Command-line entry point for consolidating a multi-store stock workbook
//! into a single table.

use std::fs::File;
use std::io::{self, Write};
use std::process;

use stockmerge::{OutputFormat, ProcessorBuilder, StockMergeError};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // init logging
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <input.xlsx> <output> [options]", args[0]);
        eprintln!("\nOptions:");
        eprintln!("  --format <xlsx|csv|json>  Output format (default: xlsx)");
        eprintln!("  --threshold <qty>         Minimum quantity counted as in stock (default: 1)");
        eprintln!("  --no-force-instock        Skip the force-instock sheet");
        eprintln!("  --stdout                  Write output to stdout instead of file");
        eprintln!("\nExamples:");
        eprintln!("  {} stock_report.xlsx final_stock_data.xlsx", args[0]);
        eprintln!("  {} stock_report.xlsx out.csv --format csv", args[0]);
        eprintln!("  {} stock_report.xlsx - --format json --stdout", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let use_stdout = output_path == "-" || args.contains(&"--stdout".to_string());

    // Parse options
    let mut format = OutputFormat::Xlsx;
    let mut threshold: Option<f64> = None;
    let mut skip_force_instock = false;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--format" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --format requires a value");
                    process::exit(1);
                }
                format = match args[i + 1].as_str() {
                    "xlsx" => OutputFormat::Xlsx,
                    "csv" => OutputFormat::Csv,
                    "json" => OutputFormat::Json,
                    other => {
                        eprintln!("Error: Unknown output format: {}", other);
                        process::exit(1);
                    }
                };
                i += 2;
            }
            "--threshold" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --threshold requires a value");
                    process::exit(1);
                }
                let value = args[i + 1].parse::<f64>().unwrap_or_else(|_| {
                    eprintln!("Error: Invalid threshold: {}", args[i + 1]);
                    process::exit(1);
                });
                threshold = Some(value);
                i += 2;
            }
            "--no-force-instock" => {
                skip_force_instock = true;
                i += 1;
            }
            "--stdout" => {
                // Already handled above
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
    }

    // Consolidate the workbook
    match consolidate_workbook(
        input_path,
        output_path,
        format,
        threshold,
        skip_force_instock,
        use_stdout,
    ) {
        Ok(_) => {
            if !use_stdout {
                println!("Consolidation completed: {} -> {}", input_path, output_path);
            }
        }
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn consolidate_workbook(
    input_path: &str,
    output_path: &str,
    format: OutputFormat,
    threshold: Option<f64>,
    skip_force_instock: bool,
    use_stdout: bool,
) -> Result<(), StockMergeError> {
    // Build processor with the selected options
    let mut builder = ProcessorBuilder::new().with_output_format(format);
    if let Some(threshold) = threshold {
        builder = builder.with_stock_threshold(threshold);
    }
    if skip_force_instock {
        builder = builder.without_force_instock();
    }
    let processor = builder.build()?;

    // Open input file
    let input = File::open(input_path)?;

    // Handle output
    if use_stdout {
        // Write to stdout
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        processor.process(input, &mut handle)?;
        handle.flush()?;
    } else {
        // Write to file
        let output = File::create(output_path)?;
        processor.process(input, output)?;
    }

    Ok(())
}

fn handle_error(error: StockMergeError) {
    match error {
        StockMergeError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        StockMergeError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid Excel file or may be corrupted.");
        }
        StockMergeError::Write(write_err) => {
            eprintln!("Write Error: {}", write_err);
            eprintln!("Failed to build the output workbook.");
        }
        StockMergeError::Json(json_err) => {
            eprintln!("JSON Error: {}", json_err);
            eprintln!("Failed to serialize the JSON output.");
        }
        StockMergeError::Zip(msg) => {
            eprintln!("ZIP Archive Error: {}", msg);
            eprintln!("The file may be corrupted or not a valid ZIP archive.");
        }
        StockMergeError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Please check your sheet selection or threshold options.");
        }
        StockMergeError::MissingSheet { name } => {
            eprintln!("Missing Sheet: '{}'", name);
            eprintln!("The workbook does not contain a required sheet.");
        }
        StockMergeError::MissingColumn { sheet, header } => {
            eprintln!("Missing Column:");
            eprintln!("  Sheet: {}", sheet);
            eprintln!("  Header: {}", header);
            eprintln!("The sheet layout does not match the expected report format.");
        }
        StockMergeError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file violates security constraints (e.g., file size limit).");
        }
    }
}
