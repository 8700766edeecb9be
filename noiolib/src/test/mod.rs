mod address;
mod report;
mod statistics;
mod trace;
