mod common;

use common::fixtures::*;
use common::pdf_assertions::{extract_link_annotations, named_destination_pages};
use common::{original_pdf, prepend, GeneratedPdf, TestResult};
use pdf_prepender::{DocumentBuilder, PdfAssembler, PdfSource, PrependError};
use std::io::Cursor;

#[test]
fn single_prefix_page_shifts_links_by_one() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let spec = spec(vec![page_with_heading(
        "Contents",
        vec![bullet("Chapter:", vec![link("Methods", 3)])],
    )]);
    let builder = DocumentBuilder::from_value(spec.clone())?;
    assert_eq!(builder.prepend_page_count()?, 1);

    let pdf = prepend(&spec, &original_pdf(10))?;
    assert_pdf_page_count!(pdf, 11);
    assert_page_contains_text!(pdf, 1, "Contents");
    assert_page_contains_text!(pdf, 4, "Original page 3");

    let links = extract_link_annotations(&pdf.doc);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].page, 1);
    assert_eq!(links[0].target_page, Some(4));
    assert_eq!(links[0].target_top, Some(792.0));

    let destinations = named_destination_pages(&pdf.doc);
    assert_eq!(destinations.get("page_4"), Some(&4));
    Ok(())
}

#[test]
fn two_prefix_pages_shift_links_by_two() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let spec = spec(vec![
        page_with_heading("Part one", vec![bullet("See", vec![link("Results", 5)])]),
        page_with_heading("Part two", vec![bullet("See", vec![link("Appendix", 7)])]),
    ]);
    let pdf = prepend(&spec, &original_pdf(10))?;
    assert_pdf_page_count!(pdf, 12);

    let targets: Vec<_> = extract_link_annotations(&pdf.doc)
        .into_iter()
        .map(|l| (l.page, l.target_page))
        .collect();
    assert_eq!(targets, vec![(1, Some(7)), (2, Some(9))]);
    assert_page_contains_text!(pdf, 7, "Original page 5");
    assert_page_contains_text!(pdf, 9, "Original page 7");
    Ok(())
}

#[test]
fn overflowing_prefix_offsets_links_on_every_page() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let entries: Vec<(String, u32)> = (1..=80).map(|n| (format!("Section {n}"), n % 20 + 1)).collect();
    let entries: Vec<(&str, u32)> = entries.iter().map(|(t, p)| (t.as_str(), *p)).collect();
    let spec = toc(&entries);

    let builder = DocumentBuilder::from_value(spec.clone())?;
    let prefix_pages = builder.prepend_page_count()?;
    assert!(prefix_pages >= 2, "80 entries should not fit on one page");

    let pdf = prepend(&spec, &original_pdf(20))?;
    assert_eq!(pdf.page_count() as u32, 20 + prefix_pages);

    let links = extract_link_annotations(&pdf.doc);
    assert_eq!(links.len(), 80);
    for (link, (_, original)) in links.iter().zip(&entries) {
        assert_eq!(link.target_page, Some(original + prefix_pages));
        assert!(link.page <= prefix_pages);
    }
    Ok(())
}

#[test]
fn bullet_with_k_links_gets_k_annotations() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let spec = spec(vec![page(vec![
        section_heading("**Index**"),
        bullet("Topics:", vec![link("Alpha", 1), text("see also"), link("Beta", 2), link("Gamma", 6)]),
        indented_bullet("Notes", vec![text("no links _here_")]),
    ])]);
    let pdf = prepend(&spec, &original_pdf(6))?;

    let mut targets: Vec<_> = extract_link_annotations(&pdf.doc)
        .into_iter()
        .filter_map(|l| l.target_page)
        .collect();
    targets.sort();
    assert_eq!(targets, vec![2, 3, 7]);
    assert_pdf_contains_text!(pdf, "Topics:");
    assert_pdf_not_contains_text!(pdf, "**");
    Ok(())
}

#[test]
fn every_page_has_exactly_one_destination() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let pdf = prepend(&toc(&[("One", 1), ("Two", 2)]), &original_pdf(4))?;
    let destinations = named_destination_pages(&pdf.doc);
    let total = pdf.page_count() as u32;

    assert_eq!(destinations.len() as u32, total);
    for n in 1..=total {
        assert_eq!(destinations.get(&format!("page_{n}")), Some(&n), "page_{n}");
    }
    Ok(())
}

#[test]
fn prepend_count_matches_output_growth() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    for spec in [
        toc(&[("A", 1)]),
        spec(vec![page(vec![]), page(vec![]), page(vec![section_heading("Third")])]),
    ] {
        let original = original_pdf(5);
        let builder = DocumentBuilder::from_value(spec)?;
        let output = GeneratedPdf::from_bytes(builder.build(&original)?)?;
        let grown = output.page_count() as u32 - PdfAssembler::page_count(&original)?;
        assert_eq!(grown, builder.prepend_page_count()?);
    }
    Ok(())
}

#[test]
fn repeated_builds_agree() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let spec = toc(&[("Intro", 1), ("Body", 3), ("End", 5)]);
    let original = original_pdf(5);
    let first = prepend(&spec, &original)?;
    let second = prepend(&spec, &original)?;

    assert_eq!(first.page_count(), second.page_count());
    assert_eq!(named_destination_pages(&first.doc), named_destination_pages(&second.doc));
    assert_eq!(extract_link_annotations(&first.doc), extract_link_annotations(&second.doc));
    Ok(())
}

#[test]
fn every_source_kind_builds_the_same_document() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let original = original_pdf(3);
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("original.pdf");
    std::fs::write(&path, &original)?;

    let builder = DocumentBuilder::from_value(toc(&[("Two", 2)]))?;
    let from_bytes = builder.build(&original)?;
    let from_path = builder.build(path.as_path())?;
    let from_reader = builder.build(PdfSource::from_reader(Cursor::new(original.clone())))?;

    for bytes in [from_bytes, from_path, from_reader] {
        let pdf = GeneratedPdf::from_bytes(bytes)?;
        assert_pdf_page_count!(pdf, 4);
        assert_pdf_internal_link_count!(pdf, 1);
    }

    let mut sink = Vec::new();
    builder.build_into(&original, &mut sink)?;
    let written = GeneratedPdf::from_bytes(sink)?;
    assert_pdf_page_count!(written, 4);
    Ok(())
}

#[test]
fn build_to_file_writes_only_on_success() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempfile::tempdir()?;
    let original = dir.path().join("original.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&original, original_pdf(2))?;

    let builder = DocumentBuilder::from_value(toc(&[("Two", 2)]))?;
    builder.build_to_file(&original, &output)?;
    let pdf = GeneratedPdf::from_bytes(std::fs::read(&output)?)?;
    assert_pdf_page_count!(pdf, 3);

    let broken = dir.path().join("broken.pdf");
    let failed_output = dir.path().join("failed.pdf");
    std::fs::write(&broken, b"not a pdf")?;
    assert!(builder.build_to_file(&broken, &failed_output).is_err());
    assert!(!failed_output.exists());

    let missing = dir.path().join("missing.pdf");
    let err = builder.build_to_file(&missing, &failed_output).unwrap_err();
    assert!(matches!(err, PrependError::NotFound(_)));
    assert!(!failed_output.exists());
    Ok(())
}

#[test]
fn malformed_original_surfaces_pdf_error() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let builder = DocumentBuilder::from_value(toc(&[("One", 1)]))?;
    let err = builder.build(b"%PDF-1.7 garbage".as_slice()).unwrap_err();
    assert!(matches!(err, PrependError::Pdf(_)), "got {err:?}");
    Ok(())
}

#[test]
fn targets_beyond_the_document_are_skipped() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let spec = spec(vec![page(vec![bullet(
        "Refs",
        vec![link("Valid", 2), link("Too far", 50)],
    )])]);
    let pdf = prepend(&spec, &original_pdf(3))?;
    assert_pdf_page_count!(pdf, 4);

    let links = extract_link_annotations(&pdf.doc);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target_page, Some(3));
    assert_pdf_contains_text!(pdf, "Too far");
    Ok(())
}

#[test]
fn targets_that_overflow_after_the_shift_fail_cleanly() -> TestResult {
    let spec = spec(vec![page(vec![bullet("Refs", vec![link("Last", u32::MAX)])])]);
    let builder = DocumentBuilder::from_value(spec)?;

    let err = builder.prepend_page_count().unwrap_err();
    assert!(matches!(
        err,
        PrependError::TargetPageOutOfRange { page: u32::MAX, offset: 1 }
    ));
    assert!(matches!(
        builder.build(&original_pdf(2)),
        Err(PrependError::TargetPageOutOfRange { .. })
    ));
    Ok(())
}

#[test]
fn link_rectangles_cover_their_text() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let spec = spec(vec![page(vec![bullet("Go to", vec![link("Conclusion", 2)])])]);
    let pdf = prepend(&spec, &original_pdf(2))?;
    let link = &extract_link_annotations(&pdf.doc)[0];
    let [x0, y0, x1, y1] = link.rect;

    // Bullets are indented 20pt from the 72pt margin; the link follows "• Go to ".
    assert!(x0 > 92.0, "x0 = {x0}");
    assert!(x1 - x0 > 40.0 && x1 < 612.0 - 72.0, "rect = {:?}", link.rect);
    assert!(y1 > y0 && y1 <= 792.0 - 72.0 + 5.0, "rect = {:?}", link.rect);
    Ok(())
}
