#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// For simplicity's sake, only one [`crate::GlobalHandler`] can be
    /// attached at any one time.
    #[error("an exception handler is already installed")]
    HandlerAlreadyInstalled,
}
