use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::types::RunResult;

pub fn render(result: &RunResult, project_root: &Path) {
    if result.cases.is_empty() {
        println!();
        println!("  {}", "\u{2501}".repeat(50).dimmed());
        println!("  {}", "no cases selected".yellow());
        println!();
        return;
    }

    let mut by_file: BTreeMap<_, Vec<_>> = BTreeMap::new();
    for c in &result.cases {
        let rel = super::relative_path(&c.file, project_root);
        by_file.entry(rel).or_default().push(c);
    }

    for (file, cases) in &by_file {
        println!();
        println!("  {}", file.dimmed());
        for c in cases {
            let kind = format!("({})", c.kind);
            if c.passed {
                println!("    {} {} {}", "\u{2713}".green(), c.name, kind.dimmed());
            } else {
                println!(
                    "    {} {} {}",
                    "\u{2717}".red(),
                    c.name.red().bold(),
                    kind.dimmed()
                );
                for line in c.message.lines() {
                    println!("        {line}");
                }
            }
        }
    }

    let passed = result.passed_count();
    let failed = result.failed_count();

    println!();
    println!("  {}", "\u{2501}".repeat(50).dimmed());
    if failed == 0 {
        println!("  {}", format!("{passed} passed").green().bold());
    } else {
        println!(
            "  {}, {}",
            format!("{failed} failed").red().bold(),
            format!("{passed} passed").green()
        );
    }
    println!();
}
