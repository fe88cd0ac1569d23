use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::core::errors::{FlexPluginsError, Result};
use crate::core::models::manifest::{PackageManifest, SCRIPTS_PACKAGE};

/// Oldest `flex-plugin-scripts` release that supports this CLI.
pub const MIN_SCRIPTS_VERSION: Version = Version::new(4, 0, 0);

/// First `major[.minor[.patch]]` run of digits in a version requirement.
static LOOSE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("Invalid loose version regex")
});

/// Which part of the version a deploy increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bump {
    Major,
    Minor,
    #[default]
    Patch,
}

/// Turn a loose requirement such as `^4.1`, `~3.9.9` or `4` into a version,
/// filling missing parts with zero.
pub fn coerce(input: &str) -> Option<Version> {
    let caps = LOOSE_VERSION.captures(input)?;
    let part = |i: usize| {
        caps.get(i)
            .map(|m| m.as_str().parse::<u64>())
            .unwrap_or(Ok(0))
    };
    Some(Version::new(part(1).ok()?, part(2).ok()?, part(3).ok()?))
}

/// Fail unless the plugin depends on a compatible `flex-plugin-scripts`.
pub fn check_scripts_version(pkg: &PackageManifest) -> Result<()> {
    let declared = pkg.dependency(SCRIPTS_PACKAGE).unwrap_or("none");
    match coerce(declared) {
        Some(version) if version >= MIN_SCRIPTS_VERSION => Ok(()),
        _ => Err(FlexPluginsError::IncompatibleScripts {
            found: declared.to_string(),
            required: MIN_SCRIPTS_VERSION,
            required_major: MIN_SCRIPTS_VERSION.major,
        }),
    }
}

/// Increment `latest` (or `0.0.0` for a first deploy).
pub fn next_version(latest: Option<&Version>, bump: Bump) -> Version {
    let base = latest.cloned().unwrap_or_else(|| Version::new(0, 0, 0));
    match bump {
        Bump::Major => Version::new(base.major + 1, 0, 0),
        Bump::Minor => Version::new(base.major, base.minor + 1, 0),
        Bump::Patch => Version::new(base.major, base.minor, base.patch + 1),
    }
}

/// Version for the next deploy: an explicit request must be strictly
/// greater than the latest registered version, otherwise `latest` is bumped.
pub fn resolve_deploy_version(
    latest: Option<&Version>,
    requested: Option<&str>,
    bump: Bump,
) -> Result<Version> {
    let Some(requested) = requested else {
        return Ok(next_version(latest, bump));
    };

    let version: Version = requested
        .trim_start_matches('v')
        .parse()
        .map_err(|e: semver::Error| FlexPluginsError::InvalidVersion {
            input: requested.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(latest) = latest
        && version <= *latest
    {
        return Err(FlexPluginsError::VersionNotGreater {
            requested: version,
            latest: latest.clone(),
        });
    }
    Ok(version)
}
