//! Answer proxy
//!
//! Serves `POST /api/answer` and forwards it to the Python backend at
//! `PYTHON_BACKEND_URL`, so browsers never talk to the backend directly.

pub mod server;

pub use server::start_server;
