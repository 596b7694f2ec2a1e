pub mod file_names;
pub mod get_client_ip;
pub mod valid_id;
