use std::path::PathBuf;

use crate::build_support::{
    config::BuildConfig,
    plan::{BuildPlan, LinkKind},
    util,
};

/// Oldest Assimp whose `aiMesh` / `aiScene` layout matches the declarations in `src/lib.rs`.
const REQUIRED_MAJOR: u32 = 5;

pub fn probe(cfg: &BuildConfig, link_kind: LinkKind) -> BuildPlan {
    if cfg.is_windows() && cfg.is_msvc() {
        return probe_vcpkg(cfg, link_kind);
    }

    let lib = pkg_config::Config::new()
        .statik(matches!(link_kind, LinkKind::Static))
        .probe("assimp")
        .unwrap_or_else(|e| {
            panic!(
                "linking the system Assimp (pkg-config) failed: {e}\n\
                 Hint: install assimp and ensure pkg-config can find assimp.pc."
            )
        });

    if parse_major_from_version(&lib.version).is_some_and(|m| m < REQUIRED_MAJOR) {
        panic!(
            "system assimp is too old (pkg-config reports version {}); Assimp >= {} is required",
            lib.version, REQUIRED_MAJOR
        );
    }

    let mut include_dirs = lib.include_paths.clone();
    if include_dirs.is_empty() {
        // pkg-config may omit /usr/include-like paths.
        include_dirs = common_include_roots();
    }
    require_major_from_headers(&include_dirs, "pkg-config");

    BuildPlan {
        include_dirs,
        link_kind,
        source: "pkg-config",
    }
}

fn probe_vcpkg(cfg: &BuildConfig, link_kind: LinkKind) -> BuildPlan {
    let mut vcpkg_cfg = vcpkg::Config::new();
    vcpkg_cfg.emit_includes(true);

    // Match Rust's CRT choice unless the user picked a triplet.
    if (cfg.use_static_crt() || matches!(link_kind, LinkKind::Static))
        && std::env::var("VCPKGRS_TRIPLET").is_err()
    {
        if let Some(triplet) = default_vcpkg_static_triplet(&cfg.target) {
            vcpkg_cfg.target_triplet(triplet);
        }
    }

    let lib = vcpkg_cfg.find_package("assimp").unwrap_or_else(|e| {
        panic!(
            "linking the system Assimp (vcpkg) failed: {e}\n\
             Hint: install assimp via vcpkg and set VCPKG_ROOT."
        )
    });

    let include_dirs = lib.include_paths.clone();
    require_major_from_headers(&include_dirs, "vcpkg");

    BuildPlan {
        include_dirs,
        link_kind,
        source: "vcpkg",
    }
}

fn default_vcpkg_static_triplet(target: &str) -> Option<&'static str> {
    if target.starts_with("x86_64-") {
        Some("x64-windows-static")
    } else if target.starts_with("i686-") {
        Some("x86-windows-static")
    } else if target.starts_with("aarch64-") {
        Some("arm64-windows-static")
    } else {
        None
    }
}

fn parse_major_from_version(version: &str) -> Option<u32> {
    version
        .split(['.', '-', '+', '~'])
        .next()?
        .trim()
        .parse::<u32>()
        .ok()
}

fn require_major_from_headers(include_dirs: &[PathBuf], source: &str) {
    let Some(found) = read_major_from_headers(include_dirs) else {
        util::warn(format!(
            "could not read the Assimp version from headers found via {source}; skipping version gate"
        ));
        return;
    };

    if found < REQUIRED_MAJOR {
        panic!(
            "system assimp headers are too old (major version {found}); Assimp >= {REQUIRED_MAJOR} is required"
        );
    }
}

fn read_major_from_headers(include_dirs: &[PathBuf]) -> Option<u32> {
    let contents = include_dirs.iter().find_map(|dir| {
        std::fs::read_to_string(dir.join("assimp").join("revision.h")).ok()
    })?;

    parse_define_u32(&contents, "VER_MAJOR")
        .or_else(|| parse_define_u32(&contents, "ASSIMP_VERSION_MAJOR"))
}

fn parse_define_u32(contents: &str, name: &str) -> Option<u32> {
    contents.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("#define")?.trim_start();
        let rest = rest.strip_prefix(name)?;
        // Reject longer names sharing the prefix (VER_MAJOR_EXTRA).
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        rest.split_whitespace().next()?.parse::<u32>().ok()
    })
}

fn common_include_roots() -> Vec<PathBuf> {
    [
        "/usr/include",
        "/usr/local/include",
        "/opt/homebrew/include",
        "/opt/local/include",
    ]
    .into_iter()
    .map(PathBuf::from)
    .filter(|p| p.exists())
    .collect()
}
