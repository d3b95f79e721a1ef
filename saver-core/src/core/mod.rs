pub mod chat;
pub mod delivery;
pub mod direct_downloader;
pub mod error;
pub mod filename;
pub mod process;
pub mod session;
pub mod temp_files;
pub mod url_parser;
pub mod ytdlp;
