/// Middleware modules for the API server
///
/// - `session`: session cookie handling and the route guard for protected endpoints

pub mod session;
