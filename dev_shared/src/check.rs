use std::fmt::Debug;

use buildmodel::{CleanError, Error, WalkError};

pub trait CheckErrorExt<T> {
  fn check(self) -> T;
}

impl<T: Debug> CheckErrorExt<T> for Result<T, std::io::Error> {
  fn check(self) -> T {
    self.expect("failed to perform io operation")
  }
}

impl<T: Debug> CheckErrorExt<T> for Result<T, Error> {
  fn check(self) -> T {
    self.expect("failed to update build description")
  }
}

impl<T: Debug> CheckErrorExt<T> for Result<T, WalkError> {
  fn check(self) -> T {
    self.expect("failed to traverse build description")
  }
}

impl<T: Debug> CheckErrorExt<T> for Result<T, CleanError> {
  fn check(self) -> T {
    self.expect("failed to clean generated resources")
  }
}
