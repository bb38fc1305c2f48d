pub mod tokio_process;
