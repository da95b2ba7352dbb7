use std::path::PathBuf;

#[cfg(target_os = "android")]
const ANDROID_FILES_DIRS: [&str; 2] = [
    "/data/user/0/de.teilgedanken.geocam/files",
    "/data/data/de.teilgedanken.geocam/files",
];

/// Get the app data directory for the current platform (config, gallery store, photos)
///
/// Android has no JNI `getFilesDir` lookup here: the path is the package's
/// fixed internal files directory, or `/data/local/tmp/geocam` as a last
/// resort when neither exists.
#[cfg(target_os = "android")]
pub fn get_app_data_dir() -> PathBuf {
    ANDROID_FILES_DIRS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .unwrap_or_else(|| PathBuf::from("/data/local/tmp/geocam"))
}

/// Get the app data directory for the current platform (config, gallery store, photos)
#[cfg(not(target_os = "android"))]
pub fn get_app_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
