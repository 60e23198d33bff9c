pub mod console;
pub mod firestore;
pub mod functions;
pub mod in_memory;
