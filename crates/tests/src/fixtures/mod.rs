pub mod audio;
pub mod test_app;
