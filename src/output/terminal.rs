// Colored terminal output for selection results and contingency tables.

use colored::Colorize;

use crate::contingency::counts::ContingencyCounts;
use crate::contingency::key::TermPair;
use crate::scoring::chi_squared::ContingencyTable;
use crate::selection::SelectionReport;

/// Display the per-category rankings as tables.
pub fn display_report(report: &SelectionReport) {
    if report.categories.is_empty() {
        println!("No categories with scorable terms.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Top {} terms per category ({} documents, {} units) ===",
            report.k, report.documents, report.count_unit
        )
        .bold()
    );

    for category in &report.categories {
        println!("\n  {}", category.category.bold());
        if category.terms.is_empty() {
            println!("    {}", "(no terms selected)".dimmed());
            continue;
        }
        println!(
            "    {:>4}  {:<28} {:>12}",
            "Rank".dimmed(),
            "Term".dimmed(),
            "Chi2".dimmed()
        );
        println!("    {}", "-".repeat(46).dimmed());

        // Scores are relative within a category; color by share of the best.
        let best = category.terms.first().map_or(0.0, |t| t.score);
        for (i, term) in category.terms.iter().enumerate() {
            let score = format!("{:>12.4}", term.score);
            let score = if best > 0.0 && term.score >= best * 0.5 {
                score.bright_green()
            } else if best > 0.0 && term.score >= best * 0.1 {
                score.bright_yellow()
            } else {
                score.normal()
            };
            println!("    {:>4}. {:<28} {}", i + 1, term.term, score);
        }
    }

    if let Some(vocabulary) = &report.vocabulary {
        println!(
            "\n  {} {} distinct terms scored",
            "Vocabulary:".dimmed(),
            vocabulary.len()
        );
    }
}

/// Display one cell's contingency table and score.
pub fn display_cell(pair: &TermPair, counts: &ContingencyCounts, table: &ContingencyTable, score: f64) {
    println!("\n{}", format!("=== {pair} ===").bold());
    println!("  {}", counts.to_string().dimmed());
    println!();
    println!("  {:<14} {:>10} {:>10}", "", "term", "no term");
    println!("  {:<14} {:>10} {:>10}", "in category", table.a, table.c);
    println!("  {:<14} {:>10} {:>10}", "elsewhere", table.b, table.d);
    println!();
    if table.is_degenerate() {
        println!("  Chi2: {} {}", "0".bold(), "(empty marginal)".dimmed());
    } else {
        println!("  Chi2: {}", format!("{score:.4}").bold());
    }
}
