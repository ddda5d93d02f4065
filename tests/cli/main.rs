mod audio;
mod manifest;
