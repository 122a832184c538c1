mod getheader;
mod manager;
mod manager_middleware;
pub(crate) mod method;

pub(crate) use getheader::get_header;
pub(crate) use manager::*;
pub(crate) use manager_middleware::*;
