pub mod bypass;
pub mod func_sim;
pub mod pipeline;
