pub mod analyze;
pub mod config;
pub mod holiday;
pub mod pay;
pub mod shift;
pub mod sync;

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
