#![cfg_attr(docsrs, feature(doc_cfg))]

//! # mailvec
//!
//! mailvec turns raw emails into bag-of-words count vectors for spam classifiers.
//!
//! Each email is reduced to the text of its first `text/plain` or `text/html` part, normalized,
//! and counted by [`Normalizer`]. A [`Vocabulary`] learned from a training corpus then encodes the
//! counts as rows of a sparse [`FeatureMatrix`] whose column 0 collects unknown words.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs;
//!
//! use mailvec::{NormalizerOptions, Pipeline, RawEmail};
//!
//! let mut emails = vec![];
//! for entry in fs::read_dir("spam").unwrap() {
//!     let raw = fs::read(entry.unwrap().path()).unwrap();
//!     emails.push(RawEmail::parse(raw).unwrap());
//! }
//!
//! let (fitted, matrix) = Pipeline::new(NormalizerOptions::default(), 1000).fit_transform(&emails);
//! for (word, index) in fitted.vocabulary().iter().take(10) {
//!     println!("{index}\t{word}");
//! }
//! println!("{:?}", matrix.shape());
//! ```
//!
//! Batch normalization runs in parallel with **crate feature** `rayon`.

mod bag;
mod email;
mod extract;
mod matrix;
mod normalizer;
mod pipeline;
mod utils;
mod vocabulary;

pub mod errors;
pub mod filters;
pub mod stemmer;

pub use bag::WordCountBag;
pub use email::{Part, RawEmail, Walk};
pub use extract::{extract_body, html_to_text, strip_markup, EMPTY_BODY};
pub use matrix::{transform, FeatureMatrix};
pub use normalizer::{Normalizer, NormalizerOptions};
pub use pipeline::{count_occurrences, FittedPipeline, Pipeline};
pub use vocabulary::{Vocabulary, COUNT_CAP, DEFAULT_VOCABULARY_SIZE, OOV_INDEX};
