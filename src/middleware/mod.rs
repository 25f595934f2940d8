pub mod secret_token;
