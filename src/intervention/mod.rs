pub mod bandit;
pub mod config;
pub mod ladder;
pub mod messages;
pub mod sampling;
pub mod selector;

pub use bandit::{get_arm_estimates, initialize_adaptation, update_adaptation};
pub use config::SelectorConfig;
pub use ladder::graduated_response;
pub use messages::render_message;
pub use sampling::{sample_beta, sample_gamma};
pub use selector::{select_intervention, select_level, FocusSnapshot};
