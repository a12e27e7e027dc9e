// Scoring: the chi-squared statistic over assembled contingency counts.

pub mod chi_squared;
