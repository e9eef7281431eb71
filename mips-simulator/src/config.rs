/// The config for `Processor`
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Stop `Processor::run` with an error after this many steps
    pub step_limit: Option<u64>,
}
