/// The ordered slide collection of a presentation.
use crate::ooxml::pptx::slide::Slide;
use std::ops::Index;

/// Slides in `<p:sldIdLst>` order.
///
/// Owned by [`Presentation`](crate::ooxml::pptx::Presentation), which hands
/// out the same collection for its whole lifetime.
///
/// # Examples
///
/// ```rust
/// use slidedeck::Presentation;
///
/// let mut pres = Presentation::new()?;
/// assert!(pres.slides().is_empty());
///
/// pres.add_slide(0)?;
/// let slides = pres.slides();
/// assert_eq!(slides.len(), 1);
/// assert_eq!(slides[0].slide_id(), 256);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Slides {
    slides: Vec<Slide>,
}

impl Slides {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Slide> {
        self.slides.iter_mut()
    }

    pub fn first(&self) -> Option<&Slide> {
        self.slides.first()
    }

    pub fn last(&self) -> Option<&Slide> {
        self.slides.last()
    }

    /// The slide whose `<p:sldId id>` is `slide_id`.
    pub fn get_by_id(&self, slide_id: u32) -> Option<&Slide> {
        self.slides.iter().find(|s| s.slide_id() == slide_id)
    }

    /// Position of the slide with `slide_id`.
    pub fn index_of(&self, slide_id: u32) -> Option<usize> {
        self.slides.iter().position(|s| s.slide_id() == slide_id)
    }

    /// Append `slide` and return it.
    pub(crate) fn push(&mut self, slide: Slide) -> &mut Slide {
        self.slides.push(slide);
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }
}

impl Index<usize> for Slides {
    type Output = Slide;

    fn index(&self, index: usize) -> &Slide {
        &self.slides[index]
    }
}

impl<'a> IntoIterator for &'a Slides {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

impl<'a> IntoIterator for &'a mut Slides {
    type Item = &'a mut Slide;
    type IntoIter = std::slice::IterMut<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::packuri::PackURI;
    use crate::ooxml::pptx::parts::SlidePart;

    fn slide(slide_id: u32, n: u32) -> Slide {
        let xml = format!(
            r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="Slide {}"><p:spTree/></p:cSld></p:sld>"#,
            n
        );
        let partname = PackURI::new(format!("/ppt/slides/slide{}.xml", n)).unwrap();
        let part = SlidePart::from_xml(partname, xml.into_bytes()).unwrap();
        Slide::new(slide_id, format!("rId{}", n + 1), part, None)
    }

    #[test]
    fn test_empty() {
        let slides = Slides::new();
        assert_eq!(slides.len(), 0);
        assert!(slides.is_empty());
        assert!(slides.get(0).is_none());
        assert!(slides.first().is_none());
        assert_eq!(slides.iter().count(), 0);
        assert_eq!((&slides).into_iter().count(), 0);
    }

    #[test]
    fn test_order_and_lookup() {
        let mut slides = Slides::new();
        slides.push(slide(256, 1));
        slides.push(slide(300, 2));
        slides.push(slide(257, 3));

        assert_eq!(slides.len(), 3);
        let ids: Vec<u32> = slides.iter().map(Slide::slide_id).collect();
        assert_eq!(ids, [256, 300, 257]);

        assert_eq!(slides[1].name(), "Slide 2");
        assert_eq!(slides.first().map(Slide::slide_id), Some(256));
        assert_eq!(slides.last().map(Slide::slide_id), Some(257));
        assert_eq!(slides.get_by_id(257).map(Slide::name), Some("Slide 3"));
        assert_eq!(slides.index_of(300), Some(1));
        assert_eq!(slides.index_of(999), None);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds() {
        let slides = Slides::new();
        let _ = &slides[0];
    }

    #[test]
    fn test_iter_mut() {
        let mut slides = Slides::new();
        slides.push(slide(256, 1));
        for slide in &mut slides {
            assert!(!slide.is_modified());
        }
        assert!(slides.get_mut(0).is_some());
    }
}
