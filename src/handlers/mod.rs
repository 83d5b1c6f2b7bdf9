// handlers/mod.rs - HTTP endpoints
//
// service:  GET /api, GET /health
// students: /api/students[/:id] resource handlers
pub mod service;
pub mod students;
