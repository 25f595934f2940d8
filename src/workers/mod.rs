pub mod update_poller;
