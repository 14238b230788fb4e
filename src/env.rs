use std::{cell::RefCell, ffi::OsStr};

/// Variable holding the default step limit.
pub const STEP_LIMIT_VAR: &str = "LS8_STEP_LIMIT";
/// Variable holding the log filter.
pub const LOG_VAR: &str = "LS8_LOG";

/// Settings read from the process environment at startup.
#[derive(Clone, Copy)]
struct Env {
    step_limit: Option<u64>,
}

thread_local! {
    /// `None` until `init` runs; written exactly once.
    static ENV: RefCell<Option<Env>> = const { RefCell::new(None) };
}

pub fn init() {
    let value = Env {
        step_limit: parse_step_limit(var(STEP_LIMIT_VAR).as_deref()),
    };
    set_env(value);
}

/// Default step budget for a run, if one was configured.
pub fn step_limit() -> Option<u64> {
    with_env(|env| env.step_limit)
}

/// Zero, negative and malformed values leave the run unlimited.
fn parse_step_limit(value: Option<&str>) -> Option<u64> {
    let limit = value?.trim().parse::<u64>().ok()?;
    if limit == 0 {
        tracing::warn!("ignoring {STEP_LIMIT_VAR}=0");
        return None;
    }
    Some(limit)
}

fn set_env(value: Env) {
    ENV.with_borrow_mut(|slot| {
        let previous = slot.replace(value);
        assert!(
            previous.is_none(),
            "ls8 environment settings were read twice"
        );
    });
}

fn with_env<F, R>(read: F) -> R
where
    F: FnOnce(&Env) -> R,
{
    ENV.with_borrow(|slot| match slot {
        Some(env) => read(env),
        None => panic!("ls8 environment settings used before `env::init`"),
    })
}

fn var(name: impl AsRef<OsStr>) -> Option<String> {
    std::env::var(name.as_ref()).ok()
}
