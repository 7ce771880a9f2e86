/// Network collaborators: the product server client and the user directory.
pub mod fetcher;
pub mod users;

#[cfg(test)]
pub mod testing;
