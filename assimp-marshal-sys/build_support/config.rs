use std::env;

#[derive(Clone, Debug)]
pub struct BuildConfig {
    #[cfg_attr(not(feature = "system"), allow(dead_code))]
    pub target: String,
    pub target_os: String,
    pub target_env: String,
    pub target_features: String,
    pub docs_rs: bool,
    pub verbose: bool,
    /// Ask pkg-config / vcpkg for a static Assimp.
    pub static_link: bool,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self {
            target: env::var("TARGET").unwrap_or_default(),
            target_os: env::var("CARGO_CFG_TARGET_OS").unwrap_or_default(),
            target_env: env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default(),
            target_features: env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default(),
            docs_rs: env::var("DOCS_RS").is_ok(),
            verbose: env::var("ASSIMP_MARSHAL_VERBOSE").is_ok(),
            static_link: matches!(env::var("ASSIMP_MARSHAL_STATIC"), Ok(v) if !v.is_empty()),
        }
    }

    pub fn is_windows(&self) -> bool {
        self.target_os == "windows"
    }

    pub fn is_macos(&self) -> bool {
        self.target_os == "macos"
    }

    pub fn is_msvc(&self) -> bool {
        self.target_env == "msvc"
    }

    #[cfg_attr(not(feature = "system"), allow(dead_code))]
    pub fn use_static_crt(&self) -> bool {
        self.is_windows()
            && self.is_msvc()
            && self
                .target_features
                .split(',')
                .any(|f| f.trim() == "crt-static")
    }

    pub fn emit_rerun_triggers(&self) {
        println!("cargo:rerun-if-changed=build.rs");

        println!("cargo:rerun-if-env-changed=ASSIMP_MARSHAL_VERBOSE");
        println!("cargo:rerun-if-env-changed=ASSIMP_MARSHAL_STATIC");

        // System discovery knobs (pkg-config/vcpkg)
        println!("cargo:rerun-if-env-changed=PKG_CONFIG");
        println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
        println!("cargo:rerun-if-env-changed=PKG_CONFIG_LIBDIR");
        println!("cargo:rerun-if-env-changed=PKG_CONFIG_SYSROOT_DIR");
        println!("cargo:rerun-if-env-changed=VCPKG_ROOT");
        println!("cargo:rerun-if-env-changed=VCPKG_INSTALLATION_ROOT");
        println!("cargo:rerun-if-env-changed=VCPKG_INSTALLED_DIR");
        println!("cargo:rerun-if-env-changed=VCPKGRS_TRIPLET");
        println!("cargo:rerun-if-env-changed=VCPKGRS_DYNAMIC");
    }
}
