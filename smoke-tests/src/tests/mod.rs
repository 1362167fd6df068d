mod smoke_cubic;
mod smoke_serialization;
mod smoke_sha256;
