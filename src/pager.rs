//! Lazy-loaded, write-back-on-close page cache over a single file.
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, error, trace};

use crate::errors::Error;
use crate::node::{Node, PAGE_SIZE};

pub const MAX_PAGES: usize = 100;

pub struct Pager {
    file: File,
    file_length: u64,
    num_pages: u32,
    pages: heapless::Vec<Option<Node>, MAX_PAGES>,
}

impl Pager {
    pub fn open(path: impl AsRef<Path>) -> Result<Pager, Error> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
            .map_err(|e| {
                error!(error = %e, path = %path.display(), "error opening DB file");
                Error::Io(e)
            })?;

        let file_length = file.seek(SeekFrom::End(0))?;

        if file_length % PAGE_SIZE as u64 != 0 {
            error!(file_length, "DB file is not a whole number of pages. Corrupt file.");
            return Err(Error::Pager(
                "DB file is not a whole number of pages. Corrupt file.".to_string(),
            ));
        }

        let num_pages = (file_length / PAGE_SIZE as u64) as u32;

        let mut pages = heapless::Vec::new();
        for _ in 0..MAX_PAGES {
            let _ = pages.push(None);
        }

        trace!(path = %path.display(), num_pages, "pager opened");

        Ok(Pager {
            file,
            file_length,
            num_pages,
            pages,
        })
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Returns the next never-before-allocated page id. Pages are never
    /// freed or compacted, so this is simply the current page count.
    pub fn unused_page_num(&self) -> u32 {
        self.num_pages
    }

    /// Returns a mutable reference to the page, reading it from disk on
    /// first access and growing `num_pages` if this id has not been seen
    /// before.
    pub fn get_page(&mut self, page_num: u32) -> Result<&mut Node, Error> {
        if page_num as usize >= MAX_PAGES {
            error!(page_num, MAX_PAGES, "page number out of bounds");
            return Err(Error::Pager(format!(
                "Tried to fetch page number out of bounds: {page_num} > {MAX_PAGES}."
            )));
        }

        if self.pages[page_num as usize].is_none() {
            let mut node = Node::new_zeroed();

            let num_pages_on_disk = self.file_length / PAGE_SIZE as u64
                + if self.file_length % PAGE_SIZE as u64 != 0 { 1 } else { 0 };

            if (page_num as u64) < num_pages_on_disk {
                self.file.seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))?;
                self.file.read_exact(&mut node.data[..]).map_err(|e| {
                    error!(error = %e, page_num, "error reading page from file");
                    Error::Io(e)
                })?;
            }

            self.pages[page_num as usize] = Some(node);

            if page_num >= self.num_pages {
                self.num_pages = page_num + 1;
            }
            trace!(page_num, "page loaded into cache");
        }

        Ok(self.pages[page_num as usize].as_mut().unwrap())
    }

    /// Writes a single cached page back to disk. Errors (as a fatal pager
    /// condition) if the slot was never populated.
    pub fn flush(&mut self, page_num: u32) -> Result<(), Error> {
        let Some(node) = self.pages[page_num as usize].as_ref() else {
            error!(page_num, "tried to flush a page that was never loaded");
            return Err(Error::Pager("Tried to flush null page.".to_string()));
        };

        self.file
            .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))
            .map_err(|e| {
                error!(error = %e, page_num, "error seeking for flush");
                Error::Io(e)
            })?;
        self.file.write_all(&node.data[..]).map_err(|e| {
            error!(error = %e, page_num, "error writing page");
            Error::Io(e)
        })?;
        debug!(page_num, "page flushed");
        Ok(())
    }

    /// Flushes every populated page and syncs the file to disk.
    pub fn flush_all(&mut self) -> Result<(), Error> {
        for page_num in 0..self.num_pages {
            if self.pages[page_num as usize].is_some() {
                self.flush(page_num)?;
            }
        }
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn fresh_file_starts_with_zero_pages() {
        let tmp = NamedTempFile::new().unwrap();
        let pager = Pager::open(tmp.path()).unwrap();
        assert_eq!(pager.num_pages(), 0);
    }

    #[test]
    fn get_page_grows_num_pages_and_caches() {
        let tmp = NamedTempFile::new().unwrap();
        let mut pager = Pager::open(tmp.path()).unwrap();
        pager.get_page(0).unwrap().init_leaf();
        assert_eq!(pager.num_pages(), 1);
        pager.get_page(3).unwrap().init_leaf();
        assert_eq!(pager.num_pages(), 4);
    }

    #[test]
    fn out_of_bounds_page_is_an_error() {
        let tmp = NamedTempFile::new().unwrap();
        let mut pager = Pager::open(tmp.path()).unwrap();
        assert!(pager.get_page(MAX_PAGES as u32).is_err());
    }

    #[test]
    fn flush_then_reopen_round_trips_a_page() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let mut pager = Pager::open(tmp.path()).unwrap();
            let node = pager.get_page(0).unwrap();
            node.init_leaf();
            node.set_leaf_num_cells(1);
            pager.flush_all().unwrap();
        }
        {
            let mut pager = Pager::open(tmp.path()).unwrap();
            assert_eq!(pager.num_pages(), 1);
            let node = pager.get_page(0).unwrap();
            assert_eq!(node.leaf_num_cells(), 1);
        }
    }
}
