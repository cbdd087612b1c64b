mod build_support;

use build_support::{config::BuildConfig, plan, system_deps};

fn main() {
    let cfg = BuildConfig::new();
    cfg.emit_rerun_triggers();

    if cfg.docs_rs {
        return;
    }

    // Without `system` this crate only carries struct declarations: nothing to link.
    let Some(plan) = plan::resolve(&cfg) else {
        return;
    };

    // Ensure the Rust binary links against the correct C++ runtime / platform deps.
    system_deps::emit(&cfg);

    plan.emit_link(&cfg);
}
