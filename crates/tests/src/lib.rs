pub mod fixtures;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod recognize_tests;
#[cfg(test)]
mod words_tests;
