// Pipeline orchestration: composes tokenizer, counter, scorer and selector
// into an ordered chain of grouped-aggregation stages.

pub mod chi_squared;
