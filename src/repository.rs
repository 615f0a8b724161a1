//! Extension and MIME type lookup tables.
//!
//! A bidirectional, case-insensitive mapping. Both directions keep their
//! value lists sorted and free of duplicates, so the "preferred" extension
//! for a MIME type is simply the first one alphabetically.

use std::collections::BTreeMap;

/// Bundled mapping covering every result the built-in detectors produce.
const DEFAULT_MAP: &[(&str, &[&str])] = &[
    ("3g2", &["video/3gpp2"]),
    ("3gp", &["video/3gpp"]),
    ("3mf", &["model/3mf"]),
    ("7z", &["application/x-7z-compressed"]),
    ("ac3", &["audio/vnd.dolby.dd-raw"]),
    ("ace", &["application/x-ace-compressed"]),
    ("aif", &["audio/aiff"]),
    ("alias", &["application/x.apple.alias"]),
    ("amr", &["audio/amr"]),
    ("ani", &["application/x-navi-animation"]),
    ("ape", &["audio/ape"]),
    ("apk", &["application/vnd.android.package-archive"]),
    ("ar", &["application/x-unix-archive"]),
    ("arj", &["application/x-arj"]),
    ("arrow", &["application/vnd.apache.arrow.file"]),
    ("asar", &["application/x-asar"]),
    ("au", &["audio/basic"]),
    ("avi", &["video/vnd.avi"]),
    ("avif", &["image/avif"]),
    ("avro", &["application/avro"]),
    ("blend", &["application/x-blender"]),
    ("bmp", &["image/bmp"]),
    ("bpg", &["image/bpg"]),
    ("bz2", &["application/x-bzip2"]),
    ("cab", &["application/vnd.ms-cab-compressed"]),
    ("chm", &["application/vnd.ms-htmlhelp"]),
    ("class", &["application/java-vm"]),
    ("cpio", &["application/x-cpio"]),
    ("cr2", &["image/x-canon-cr2"]),
    ("cr3", &["image/x-canon-cr3"]),
    ("crx", &["application/x-google-chrome-extension"]),
    ("cur", &["image/x-icon"]),
    ("dat", &["application/x-ft-windows-registry-hive"]),
    ("dcm", &["application/dicom"]),
    ("deb", &["application/x-deb"]),
    ("dmg", &["application/x-apple-diskimage"]),
    ("docm", &["application/vnd.ms-word.document.macroenabled.12"]),
    ("docx", &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"]),
    ("dotm", &["application/vnd.ms-word.template.macroenabled.12"]),
    ("dotx", &["application/vnd.openxmlformats-officedocument.wordprocessingml.template"]),
    ("drc", &["application/vnd.google.draco"]),
    ("dsf", &["audio/x-dsf"]),
    ("dwg", &["image/vnd.dwg"]),
    ("elf", &["application/x-elf"]),
    ("eot", &["application/vnd.ms-fontobject"]),
    ("eps", &["application/eps"]),
    ("epub", &["application/epub+zip"]),
    ("exe", &["application/x-msdownload"]),
    ("f4a", &["audio/mp4"]),
    ("f4b", &["audio/mp4"]),
    ("f4p", &["video/mp4"]),
    ("f4v", &["video/mp4"]),
    ("fbx", &["application/x.autodesk.fbx"]),
    ("flac", &["audio/x-flac"]),
    ("flif", &["image/flif"]),
    ("flv", &["video/x-flv"]),
    ("g3drem", &["application/octet-stream"]),
    ("gif", &["image/gif"]),
    ("glb", &["model/gltf-binary"]),
    ("gz", &["application/gzip"]),
    (
        "heic",
        &["image/heic", "image/heic-sequence", "image/heif", "image/heif-sequence"],
    ),
    ("html", &["text/html"]),
    ("icc", &["application/vnd.iccprofile"]),
    ("icns", &["image/icns"]),
    ("ico", &["image/x-icon"]),
    ("ics", &["text/calendar"]),
    ("indd", &["application/x-indesign"]),
    ("it", &["audio/x-it"]),
    ("j2c", &["image/j2c"]),
    ("jar", &["application/java-archive"]),
    ("jp2", &["image/jp2"]),
    ("jpg", &["image/jpeg"]),
    ("jpm", &["image/jpm"]),
    ("jpx", &["image/jpx"]),
    ("jxl", &["image/jxl"]),
    ("jxr", &["image/vnd.ms-photo"]),
    ("ktx", &["image/ktx"]),
    ("lnk", &["application/x.ms.shortcut"]),
    ("luac", &["application/x-lua-bytecode"]),
    ("lz", &["application/x-lzip"]),
    ("lz4", &["application/x-lz4"]),
    ("lzh", &["application/x-lzh-compressed"]),
    ("m4a", &["audio/mp4", "audio/x-m4a"]),
    ("m4b", &["audio/mp4"]),
    ("m4p", &["video/mp4"]),
    ("m4v", &["video/x-m4v"]),
    ("macho", &["application/x-mach-binary"]),
    ("mid", &["audio/midi"]),
    ("mie", &["application/x-mie"]),
    ("mj2", &["image/mj2"]),
    ("mkv", &["video/x-matroska"]),
    ("mobi", &["application/x-mobipocket-ebook"]),
    ("mov", &["video/quicktime"]),
    ("mp2", &["audio/mpeg"]),
    ("mp3", &["audio/mpeg"]),
    ("mp4", &["audio/mpeg", "video/mp4"]),
    ("mpc", &["audio/x-musepack"]),
    ("mpg", &["video/mpeg"]),
    ("msi", &["application/x-msi"]),
    ("mts", &["video/mp2t"]),
    ("mxf", &["application/mxf"]),
    ("nes", &["application/x-nintendo-nes-rom"]),
    ("odg", &["application/vnd.oasis.opendocument.graphics"]),
    ("odp", &["application/vnd.oasis.opendocument.presentation"]),
    ("ods", &["application/vnd.oasis.opendocument.spreadsheet"]),
    ("odt", &["application/vnd.oasis.opendocument.text"]),
    ("oga", &["audio/ogg"]),
    ("ogg", &["audio/ogg"]),
    ("ogm", &["video/ogg"]),
    ("ogv", &["video/ogg"]),
    ("ogx", &["application/ogg"]),
    ("opus", &["audio/opus"]),
    ("orf", &["image/x-olympus-orf"]),
    ("otf", &["font/otf"]),
    ("otg", &["application/vnd.oasis.opendocument.graphics-template"]),
    ("otp", &["application/vnd.oasis.opendocument.presentation-template"]),
    ("ots", &["application/vnd.oasis.opendocument.spreadsheet-template"]),
    ("ott", &["application/vnd.oasis.opendocument.text-template"]),
    ("parquet", &["application/vnd.apache.parquet"]),
    ("pcap", &["application/vnd.tcpdump.pcap"]),
    ("pdf", &["application/pdf"]),
    ("pgp", &["application/pgp-encrypted"]),
    ("png", &["image/png"]),
    ("potm", &["application/vnd.ms-powerpoint.template.macroenabled.12"]),
    ("potx", &["application/vnd.openxmlformats-officedocument.presentationml.template"]),
    ("ppsm", &["application/vnd.ms-powerpoint.slideshow.macroenabled.12"]),
    ("ppsx", &["application/vnd.openxmlformats-officedocument.presentationml.slideshow"]),
    ("pptm", &["application/vnd.ms-powerpoint.presentation.macroenabled.12"]),
    ("pptx", &["application/vnd.openxmlformats-officedocument.presentationml.presentation"]),
    ("ps", &["application/postscript"]),
    ("psd", &["image/vnd.adobe.photoshop"]),
    ("pst", &["application/vnd.ms-outlook"]),
    ("qcp", &["audio/qcelp"]),
    ("raf", &["image/x-fujifilm-raf"]),
    ("rar", &["application/x-rar-compressed"]),
    ("rdf", &["application/rdf+xml"]),
    ("reg", &["application/x-ms-regedit"]),
    ("rm", &["application/vnd.rn-realmedia"]),
    ("rpm", &["application/x-rpm"]),
    ("rss", &["application/rss+xml"]),
    ("rtf", &["application/rtf"]),
    ("rw2", &["image/x-panasonic-rw2"]),
    ("s3m", &["audio/x-s3m"]),
    ("shp", &["application/x-esri-shape"]),
    ("spx", &["audio/ogg"]),
    ("sqlite", &["application/x-sqlite3"]),
    ("stl", &["model/stl"]),
    ("studio3", &["application/octet-stream"]),
    ("svg", &["image/svg+xml"]),
    ("swf", &["application/x-shockwave-flash"]),
    ("tar", &["application/x-tar"]),
    ("tif", &["image/tiff"]),
    ("ttc", &["font/collection"]),
    ("ttf", &["font/ttf"]),
    ("unicorn", &["application/unicorn"]),
    ("vcf", &["text/vcard"]),
    ("voc", &["audio/x-voc"]),
    ("vsd", &["application/vnd.visio"]),
    ("vsdx", &["application/vnd.visio"]),
    ("vstx", &["application/vnd.ms-visio.template.main+xml"]),
    ("vtt", &["text/vtt"]),
    ("wasm", &["application/wasm"]),
    ("wav", &["audio/vnd.wave"]),
    ("webm", &["video/webm"]),
    ("webp", &["image/webp"]),
    ("wmv", &["video/x-ms-wmv"]),
    ("woff", &["font/woff"]),
    ("woff2", &["font/woff2"]),
    ("wv", &["audio/wavpack"]),
    ("xcf", &["image/x-xcf"]),
    ("xls", &["application/vnd.ms-excel"]),
    ("xlsm", &["application/vnd.ms-excel.sheet.macroenabled.12"]),
    ("xlsx", &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"]),
    ("xltm", &["application/vnd.ms-excel.template.macroenabled.12"]),
    ("xltx", &["application/vnd.openxmlformats-officedocument.spreadsheetml.template"]),
    ("xm", &["audio/x-xm"]),
    ("xml", &["application/xml"]),
    ("xpi", &["application/x-xpinstall"]),
    ("xz", &["application/x-xz"]),
    ("z", &["application/x-compress"]),
    ("zip", &["application/zip"]),
    ("zst", &["application/zstd"]),
];

/// Bidirectional extension ↔ MIME type map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeTypeRepository {
    extension_to_mime: BTreeMap<String, Vec<String>>,
    mime_to_extension: BTreeMap<String, Vec<String>>,
}

impl Default for MimeTypeRepository {
    /// The bundled table.
    fn default() -> Self {
        Self::from_map(DEFAULT_MAP.iter().map(|(ext, mimes)| (*ext, mimes.iter().copied())))
    }
}

impl MimeTypeRepository {
    /// An empty repository.
    pub fn empty() -> Self {
        Self {
            extension_to_mime: BTreeMap::new(),
            mime_to_extension: BTreeMap::new(),
        }
    }

    pub fn from_map<'a, I, M>(map: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, M)>,
        M: IntoIterator<Item = &'a str>,
    {
        let mut repository = Self::empty();
        for (extension, mime_types) in map {
            repository.register(extension, mime_types);
        }
        repository
    }

    /// Associate `extension` with each of `mime_types`, case-insensitively.
    ///
    /// Registering an extension with no MIME types still makes it known.
    pub fn register<'a, M>(&mut self, extension: &str, mime_types: M)
    where
        M: IntoIterator<Item = &'a str>,
    {
        let extension = extension.to_ascii_lowercase();
        self.extension_to_mime.entry(extension.clone()).or_default();

        for mime_type in mime_types {
            let mime_type = mime_type.to_ascii_lowercase();
            if let Some(mimes) = self.extension_to_mime.get_mut(&extension) {
                insert_sorted(mimes, mime_type.clone());
            }
            insert_sorted(
                self.mime_to_extension.entry(mime_type).or_default(),
                extension.clone(),
            );
        }
    }

    /// MIME types for `extension`, sorted; empty when unknown.
    pub fn mime_types_for_extension(&self, extension: &str) -> &[String] {
        self.extension_to_mime
            .get(&extension.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Alphabetically first extension for `mime_type`, or `""`.
    pub fn extension_for_mime_type(&self, mime_type: &str) -> &str {
        self.extensions_for_mime_type(mime_type)
            .first()
            .map_or("", String::as_str)
    }

    pub fn extensions_for_mime_type(&self, mime_type: &str) -> &[String] {
        self.mime_to_extension
            .get(&mime_type.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every MIME type with its extensions.
    pub fn all(&self) -> &BTreeMap<String, Vec<String>> {
        &self.mime_to_extension
    }

    pub fn len(&self) -> usize {
        self.extension_to_mime.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_to_mime.is_empty()
    }
}

fn insert_sorted(list: &mut Vec<String>, value: String) {
    if let Err(pos) = list.binary_search(&value) {
        list.insert(pos, value);
    }
}
