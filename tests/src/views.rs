mod detail;
mod scan_request;
