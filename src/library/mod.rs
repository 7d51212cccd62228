//! Destination path planning for the media library.
//!
//! Computes where a resolved file belongs in the library tree. Planning is a
//! pure function of the resolved metadata and the original extension, so the
//! same inputs always produce the same plan.
//!
//! Layouts follow the media-server convention of tagging folders with the
//! provider id:
//!
//! ```text
//! Movies/Some Movie (2020) - [id-55]/Some Movie (2020) - [id-55].mp4
//! Series/Show Name [id-100]/Season 1/Show Name - S01E02 - Pilot Two.mkv
//! ```

use std::path::PathBuf;

use crate::metadata::ResolvedMedia;

/// A computed move target: the directory to create and the file name to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPlan {
    pub directory: PathBuf,
    pub file_name: String,
}

impl DestinationPlan {
    /// The full destination path for the file.
    pub fn full_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Root directories of the library tree.
#[derive(Debug, Clone)]
pub struct LibraryLayout {
    movies_root: PathBuf,
    series_root: PathBuf,
}

impl LibraryLayout {
    pub fn new(movies_root: PathBuf, series_root: PathBuf) -> Self {
        Self {
            movies_root,
            series_root,
        }
    }

    /// Plan the destination for a resolved file.
    ///
    /// `extension` is the original extension including the leading dot, or
    /// empty when the source had none.
    pub fn plan(&self, resolved: &ResolvedMedia, extension: &str) -> DestinationPlan {
        match resolved {
            ResolvedMedia::Movie {
                title,
                year,
                provider_id,
            } => {
                let folder = format!("{title} ({year}) - [id-{provider_id}]");
                DestinationPlan {
                    file_name: format!("{folder}{extension}"),
                    directory: self.movies_root.join(folder),
                }
            }
            ResolvedMedia::Episode {
                show_title,
                provider_id,
                season,
                episode,
                episode_title,
            } => DestinationPlan {
                directory: self
                    .series_root
                    .join(format!("{show_title} [id-{provider_id}]"))
                    .join(format!("Season {season}")),
                file_name: format!(
                    "{show_title} - S{season:02}E{episode:02} - {episode_title}{extension}"
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn layout() -> LibraryLayout {
        LibraryLayout::new(PathBuf::from("/library/Movies"), PathBuf::from("/library/Series"))
    }

    fn movie() -> ResolvedMedia {
        ResolvedMedia::Movie {
            title: "Some Movie".into(),
            year: "2020".into(),
            provider_id: 55,
        }
    }

    fn episode() -> ResolvedMedia {
        ResolvedMedia::Episode {
            show_title: "Show Name".into(),
            provider_id: 100,
            season: 1,
            episode: 2,
            episode_title: "Pilot Two".into(),
        }
    }

    #[test]
    fn movie_plan_repeats_folder_name_in_file() {
        let plan = layout().plan(&movie(), ".mp4");
        assert_eq!(
            plan.directory,
            Path::new("/library/Movies/Some Movie (2020) - [id-55]")
        );
        assert_eq!(plan.file_name, "Some Movie (2020) - [id-55].mp4");
        assert_eq!(
            plan.full_path(),
            Path::new("/library/Movies/Some Movie (2020) - [id-55]/Some Movie (2020) - [id-55].mp4")
        );
    }

    #[test]
    fn episode_plan_pads_season_and_episode_in_file_name_only() {
        let plan = layout().plan(&episode(), ".mkv");
        assert_eq!(
            plan.directory,
            Path::new("/library/Series/Show Name [id-100]/Season 1")
        );
        assert_eq!(plan.file_name, "Show Name - S01E02 - Pilot Two.mkv");
    }

    #[test]
    fn two_digit_season_keeps_natural_width_in_folder() {
        let plan = layout().plan(
            &ResolvedMedia::Episode {
                show_title: "Long Runner".into(),
                provider_id: 9,
                season: 10,
                episode: 5,
                episode_title: "Ep5".into(),
            },
            ".mkv",
        );
        assert_eq!(
            plan.directory,
            Path::new("/library/Series/Long Runner [id-9]/Season 10")
        );
        assert_eq!(plan.file_name, "Long Runner - S10E05 - Ep5.mkv");
    }

    #[test]
    fn unknown_year_uses_zero_placeholder() {
        let plan = layout().plan(
            &ResolvedMedia::Movie {
                title: "Obscure".into(),
                year: "0000".into(),
                provider_id: 7,
            },
            ".avi",
        );
        assert_eq!(plan.file_name, "Obscure (0000) - [id-7].avi");
    }

    #[test]
    fn missing_extension_is_preserved_as_absent() {
        let plan = layout().plan(&movie(), "");
        assert_eq!(plan.file_name, "Some Movie (2020) - [id-55]");
    }

    #[test]
    fn planning_is_idempotent() {
        let a = layout().plan(&episode(), ".mkv");
        let b = layout().plan(&episode(), ".mkv");
        assert_eq!(a, b);
    }
}
