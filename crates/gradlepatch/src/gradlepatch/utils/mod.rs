pub mod writer;

#[cfg(test)]
pub mod test_server;
