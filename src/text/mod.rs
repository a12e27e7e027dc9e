// Text normalization: tokenization into per-document term sets.

pub mod tokenizer;
