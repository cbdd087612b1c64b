use std::path::PathBuf;

use crate::build_support::{config::BuildConfig, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    Static,
    Dynamic,
}

#[derive(Clone, Debug)]
pub struct BuildPlan {
    pub include_dirs: Vec<PathBuf>,
    pub link_kind: LinkKind,
    pub source: &'static str,
}

impl BuildPlan {
    pub fn emit_link(&self, cfg: &BuildConfig) {
        // pkg-config / vcpkg already printed the rustc link flags; expose include paths to
        // downstream build scripts (DEP_ASSIMP_INCLUDE / DEP_ASSIMP_INCLUDE_PATHS).
        if let Some(first) = self.include_dirs.first() {
            println!("cargo:include={}", first.display());
        }
        if let Some(joined) = util::join_paths_for_env(&self.include_dirs) {
            println!("cargo:include_paths={}", joined);
        }

        if cfg.verbose {
            util::warn(format!(
                "Assimp plan: source={} link_kind={:?}",
                self.source, self.link_kind
            ));
            for p in &self.include_dirs {
                util::warn(format!("Assimp include: {}", p.display()));
            }
        }
    }
}

pub fn resolve(cfg: &BuildConfig) -> Option<BuildPlan> {
    let link_kind = if cfg.static_link {
        LinkKind::Static
    } else {
        LinkKind::Dynamic
    };

    #[cfg(feature = "system")]
    {
        Some(crate::build_support::system::probe(cfg, link_kind))
    }

    #[cfg(not(feature = "system"))]
    {
        if cfg.verbose {
            util::warn(format!(
                "assimp-marshal-sys built without `system`; ignoring link kind {link_kind:?}"
            ));
        }
        None
    }
}
