// Every collector thread draws from its own stream, so workers never contend
// on a shared rng and two workers never replay the same action sequence.

use rand::{SeedableRng, rngs::StdRng};
use std::cell::RefCell;

thread_local! {
    pub static RNG: RefCell<StdRng> = RefCell::new(StdRng::from_os_rng());
}
