mod config_override;
mod fault_paths;
mod session_flow;
