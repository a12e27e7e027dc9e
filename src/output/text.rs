// Line-oriented text output.
//
//   books plot=2.25 prose=1.5
//   electronics battery=3 cable=0.75
//   battery cable plot prose
//
// One line per category in category order, then the vocabulary on one line
// when it was collected.

use crate::selection::SelectionReport;

pub fn render(report: &SelectionReport) -> String {
    let mut out = String::new();
    for category in &report.categories {
        out.push_str(&category.category);
        for term in &category.terms {
            out.push_str(&format!(" {}={}", term.term, term.score));
        }
        out.push('\n');
    }
    if let Some(vocabulary) = &report.vocabulary {
        out.push_str(&vocabulary.join(" "));
        out.push('\n');
    }
    out
}
