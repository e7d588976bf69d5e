//! OpenGL version detection

use glow::{Context, HasContext};
use std::fmt;

/// OpenGL version information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
    pub is_es: bool,
}

impl GlVersion {
    /// Read the OpenGL version from the current context
    pub fn read(gl: &Context) -> Self {
        let version_string = unsafe { gl.get_parameter_string(glow::VERSION) };
        Self::parse(&version_string)
    }

    /// Parse OpenGL version from version string
    pub fn parse(version_string: &str) -> Self {
        // Examples:
        // "4.6.0 NVIDIA 460.89"
        // "3.3 (Core Profile) Mesa 23.1.4"
        // "OpenGL ES 3.0 (OpenGL ES GLSL ES 3.00)"
        let is_es = version_string.contains("OpenGL ES");

        let (major, minor) = Self::parse_version_numbers(version_string)
            .unwrap_or(if is_es { (2, 0) } else { (2, 1) });

        Self {
            major,
            minor,
            is_es,
        }
    }

    fn parse_version_numbers(version_string: &str) -> Option<(u32, u32)> {
        version_string.split_whitespace().find_map(|word| {
            let (major_str, rest) = word.split_once('.')?;
            let minor_str = rest.split('.').next().unwrap_or(rest);
            Some((major_str.parse().ok()?, minor_str.parse().ok()?))
        })
    }

    /// Check if this version supports glDrawElementsBaseVertex
    ///
    /// Desktop GL 3.2 and GLES 3.2 both promote it to core.
    pub fn vertex_offset_support(self) -> bool {
        self.major > 3 || (self.major == 3 && self.minor >= 2)
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_es {
            write!(f, "OpenGL ES {}.{}", self.major, self.minor)
        } else {
            write!(f, "OpenGL {}.{}", self.major, self.minor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_desktop_vendor_strings() {
        assert_eq!(
            GlVersion::parse("4.6.0 NVIDIA 460.89"),
            GlVersion {
                major: 4,
                minor: 6,
                is_es: false
            }
        );
        assert_eq!(
            GlVersion::parse("3.3 (Core Profile) Mesa 23.1.4"),
            GlVersion {
                major: 3,
                minor: 3,
                is_es: false
            }
        );
    }

    #[test]
    fn parses_es_strings() {
        let version = GlVersion::parse("OpenGL ES 3.0 (OpenGL ES GLSL ES 3.00)");
        assert!(version.is_es);
        assert_eq!((version.major, version.minor), (3, 0));
    }

    #[test]
    fn falls_back_when_unparseable() {
        assert_eq!(
            GlVersion::parse("garbage"),
            GlVersion {
                major: 2,
                minor: 1,
                is_es: false
            }
        );
    }

    #[test]
    fn base_vertex_needs_gl_3_2() {
        assert!(!GlVersion::parse("3.1 Mesa").vertex_offset_support());
        assert!(GlVersion::parse("3.2.0 Mesa").vertex_offset_support());
        assert!(GlVersion::parse("4.1 Metal").vertex_offset_support());
        assert!(!GlVersion::parse("OpenGL ES 3.0").vertex_offset_support());
        assert!(GlVersion::parse("OpenGL ES 3.2").vertex_offset_support());
    }

    #[test]
    fn display_round_trips_numbers() {
        assert_eq!(GlVersion::parse("4.5.0").to_string(), "OpenGL 4.5");
    }
}
