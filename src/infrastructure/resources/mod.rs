mod resource_acquirer;

pub use resource_acquirer::TempFileAcquirer;
