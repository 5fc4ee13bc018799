use crate::adapters::InputFormat;

/// List all supported input formats
pub fn list_formats() {
    println!();
    println!("Sarifize — Supported Input Formats");
    println!("{}", "━".repeat(55));
    println!();

    for format in InputFormat::ALL {
        println!("  📋 {} ", format.name());
        println!("     {}", format.description());
        println!();
    }

    println!("{}", "━".repeat(55));
    println!();
    println!("  Run `sarifize convert -f plist report.plist` to convert a report");
    println!("  Run `sarifize convert -f infer infer-out/report.json -o out.sarif`");
    println!();
}
