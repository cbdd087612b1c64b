use crate::build_support::config::BuildConfig;

/// Platform libraries a static Assimp pulls in. A shared libassimp carries its own.
pub fn emit(cfg: &BuildConfig) {
    if !cfg.static_link {
        return;
    }

    if cfg.is_windows() {
        if cfg.is_msvc() {
            println!("cargo:rustc-link-lib=advapi32");
        } else {
            // MinGW
            println!("cargo:rustc-link-lib=stdc++");
        }
        return;
    }

    if cfg.is_macos() {
        println!("cargo:rustc-link-lib=c++");
        return;
    }

    // Linux/BSD
    println!("cargo:rustc-link-lib=stdc++");
}
